/// Evaluates the tokens, logging how long they took.
#[doc(hidden)]
#[macro_export]
macro_rules! time {
    ($label:expr, $($token:tt)*) => ({
        let start = std::time::Instant::now();
        let value = { $($token)* };
        $crate::log::info!("{} took {}ms", $label, start.elapsed().as_millis());
        value
    });
}

pub use time;
