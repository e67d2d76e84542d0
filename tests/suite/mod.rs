mod binary;
mod flows;
mod session;
