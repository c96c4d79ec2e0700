use std::fmt::Display;

/// Unwraps `res`, or logs the error and terminates the process.
pub fn check_error<T, E: Display>(res: Result<T, E>) -> T {
    match res {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(error=%e, "fatal");
            std::process::exit(1)
        }
    }
}

pub fn get_named<'a, T, F>(items: &'a [T], name: &str, name_of: F) -> Option<&'a T>
where
    F: Fn(&T) -> &str,
{
    items.iter().find(|item| name_of(item).eq(name))
}
