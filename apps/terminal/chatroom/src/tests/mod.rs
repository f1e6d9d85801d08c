mod command;
mod logger;
