mod fetch;
mod pull;
mod push;
