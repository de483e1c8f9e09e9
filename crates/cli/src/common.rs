//! Helpers shared by the CLI commands.

use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Run a command body, printing its error and mapping the result to an exit code.
pub async fn run_command<F, Fut>(f: F) -> i32
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), String>>,
{
    exit_code(f().await)
}

/// `0` on success; prints the error and returns `1` otherwise.
pub fn exit_code(result: Result<(), String>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

/// Steady-ticking spinner showing `message`.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());
    spinner
}

/// Time since `start`, as `120ms` or `2s 40ms`.
pub fn format_elapsed_ms(start: Instant) -> String {
    format_duration(start.elapsed())
}

fn format_duration(elapsed: Duration) -> String {
    if elapsed.as_secs() == 0 {
        return format!("{}ms", elapsed.as_millis());
    }
    format!("{}s {}ms", elapsed.as_secs(), elapsed.subsec_millis())
}

/// Show a spinner while `f` runs and print `success_message` with the elapsed time on success.
pub async fn run_with_spinner_async<T, F, Fut>(
    description: &str,
    success_message: &str,
    f: F,
) -> Result<T, String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, String>>,
{
    let spinner = spinner(description);
    let start = Instant::now();
    let result = f().await;
    spinner.finish_and_clear();
    if result.is_ok() {
        println!("{} ({})", success_message, format_elapsed_ms(start));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(42)), "42ms");
        assert_eq!(format_duration(Duration::from_millis(2_305)), "2s 305ms");
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(exit_code(Ok(())), 0);
        assert_eq!(exit_code(Err("boom".into())), 1);
    }
}
