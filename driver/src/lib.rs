use error_stack::{Report, ResultExt};
use kernel::KernelError;

pub mod database;
pub mod error;

pub(crate) fn env(key: &str) -> error_stack::Result<String, KernelError> {
    dotenvy::var(key)
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| format!("Env {key} not specified"))
}

pub(crate) fn env_or<T>(key: &str, default: T) -> error_stack::Result<T, KernelError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match dotenvy::var(key) {
        Ok(value) => value.parse::<T>().map_err(|error| {
            Report::new(KernelError::InvalidArgument)
                .attach_printable(format!("Env {key} is malformed: {error}"))
        }),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(default),
        Err(error) => Err(Report::new(error).change_context(KernelError::Internal)),
    }
}
