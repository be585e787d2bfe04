pub(crate) mod temporal;
