macro_rules! fail {
    ($err:expr) => (
        return Err(From::from($err))
    );
    ($fmt:expr, $($arg:tt)*) => (
        fail!(format!($fmt, $($arg)*))
    );
}

macro_rules! ensure {
    ($expr:expr, $err:expr) => (
        if !($expr) {
            fail!($err);
        }
    );
    ($expr: expr, $fmt:expr, $($arg:tt)*) => (
        if !($expr) {
            fail!(format!($fmt, $($arg)*));
        }
    );
}

/// Returns a storage error (as opposed to an internal one).
macro_rules! storage_err {
    ($($arg:tt)*) => (
        $crate::Error::Storage(format!($($arg)*))
    );
}

/// Asserts that `$expr` fails with an error whose message mentions `$err`.
#[cfg(test)]
#[allow(unused_macros)]
macro_rules! assert_err {
    ($expr:expr, $err:expr) => {
        match $expr {
            Ok(_) => panic!("expected `{}` to fail", stringify!($expr)),
            Err(e) => {
                let desc = e.to_string();
                assert!(
                    desc.contains($err),
                    "error `{}` from `{}` does not mention `{}`",
                    desc,
                    stringify!($expr),
                    $err
                );
            }
        }
    };
}
