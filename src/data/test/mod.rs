mod counting;
mod invite;
