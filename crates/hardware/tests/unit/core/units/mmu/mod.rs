/// Register window byte-lane behaviour.
pub mod csr;
