pub mod hostlist;
pub mod sync;
