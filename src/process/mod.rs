// ABOUTME: Process object graph read by path expressions
// ABOUTME: Exports the serde-loadable process, project, step and user types

pub mod model;

pub use model::{Process, ProcessProperty, Project, Step, StepStatus, User};
