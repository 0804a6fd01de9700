pub mod invite_sync;
