mod sentinel;

pub use sentinel::SentinelRouter;
