pub mod alns;
