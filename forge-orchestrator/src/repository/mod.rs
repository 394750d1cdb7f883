//! Repository Module
//!
//! Data access layer for the orchestrator.
//! Each repository handles database operations for a specific domain entity.

pub mod focus_area;
pub mod job;
pub mod model;
pub mod problem;
pub mod test_case;

// Re-export for convenience
pub use self::focus_area as focus_area_repository;
pub use self::job as job_repository;
pub use self::model as model_repository;
pub use self::problem as problem_repository;
pub use self::test_case as test_case_repository;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve_to_repository_modules() {
        // `test_case` also names a built-in attribute; the alias must pick the module
        let _ = test_case_repository::find_by_problem;
        let _ = test_case_repository::replace_for_problem;
        let _ = job_repository::append_step;
        let _ = model_repository::find_by_name;
    }
}
