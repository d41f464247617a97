/// Loose "is this switched on" check used for flags read from query strings,
/// form values and JSON.
///
/// Only `"1"`, `"true"` (any case), the number one and `true` count; every
/// other value, including other non-zero numbers, is false.
pub trait Truthy {
    fn is_true(&self) -> bool;
}

impl Truthy for str {
    fn is_true(&self) -> bool {
        self == "1" || self.eq_ignore_ascii_case("true")
    }
}

impl Truthy for String {
    fn is_true(&self) -> bool {
        self.as_str().is_true()
    }
}

impl Truthy for bool {
    fn is_true(&self) -> bool {
        *self
    }
}

macro_rules! impl_truthy_int {
    ($($t:ty),*) => {
        $(
            impl Truthy for $t {
                fn is_true(&self) -> bool {
                    *self == 1
                }
            }
        )*
    };
}

impl_truthy_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Truthy for f32 {
    fn is_true(&self) -> bool {
        *self == 1.0
    }
}

impl Truthy for f64 {
    fn is_true(&self) -> bool {
        *self == 1.0
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_true(&self) -> bool {
        (**self).is_true()
    }
}

pub fn is_true<T: Truthy + ?Sized>(value: &T) -> bool {
    value.is_true()
}

/// `condition ? a : b`
pub fn ternary<T>(condition: bool, a: T, b: T) -> T {
    if condition {
        a
    } else {
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strings() {
        assert!(is_true("1"));
        assert!(is_true("true"));
        assert!(is_true("TRUE"));
        assert!(is_true(&"True".to_string()));
        assert!(!is_true("yes"));
        assert!(!is_true("0"));
        assert!(!is_true(""));
    }

    #[test]
    fn test_numbers() {
        assert!(is_true(&1i8));
        assert!(is_true(&1u64));
        assert!(is_true(&1usize));
        assert!(is_true(&1.0f32));
        assert!(is_true(&1.0f64));
        assert!(!is_true(&5));
        assert!(!is_true(&0u8));
        assert!(!is_true(&-1i32));
        assert!(!is_true(&1.5f64));
    }

    #[test]
    fn test_bool() {
        assert!(is_true(&true));
        assert!(!is_true(&false));
    }

    #[test]
    fn test_references() {
        let flag = "true";
        let count = 1u32;
        assert!(is_true(&flag));
        assert!(is_true(&&count));
        assert!(!is_true(&&0i64));
    }

    #[test]
    fn test_ternary() {
        assert_eq!(ternary(true, "a", "b"), "a");
        assert_eq!(ternary(false, 1, 2), 2);
    }
}
