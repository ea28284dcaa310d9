mod cache;
mod errors;
mod polymorphism;
mod warnings;
