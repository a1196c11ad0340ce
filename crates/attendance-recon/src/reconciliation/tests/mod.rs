mod common;
mod merging;
