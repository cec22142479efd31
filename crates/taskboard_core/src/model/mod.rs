mod task;

pub use task::{Bucket, Task};
