/// Asserts that `$expr` fails with an error whose message mentions `$err`.
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

/// Same as `assert_err!`, but `$re` is a regular expression.
#[allow(unused_macros)]
macro_rules! assert_err_re {
    ($expr:expr, $re:expr) => {
        match $expr {
            Ok(_) => panic!("expected `{}` to fail", stringify!($expr)),
            Err(e) => {
                let desc = e.to_string();
                let re = regex::Regex::new($re).unwrap();
                assert!(
                    re.is_match(&desc),
                    "error `{}` from `{}` does not match /{}/",
                    desc,
                    stringify!($expr),
                    re
                );
            }
        }
    };
}
