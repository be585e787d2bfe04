pub(crate) mod db;
pub(crate) mod offset;
pub(crate) mod posix;
pub(crate) mod zone;
