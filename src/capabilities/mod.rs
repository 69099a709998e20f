//! Process-wide, read-only description of what this build supports.

pub mod descriptor;
