/* ************************************************************************ **
** This file is part of linfit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of linfit is provided under this permissive        **
** license, and that the project as a whole is licensed under the GPL 3.0.  **
** ************************************************************************ */

//! Approximate equality assertions for floats and slices of floats.
//!
//! ```
//! # #[macro_use] extern crate linfit_assert_close;
//! # fn main() {
//! assert_close!(0.1 + 0.2, 0.3);
//! assert_close!(abs=1e-3, 2.0001, 2.0);
//! assert_close!(rel=1e-2, abs=0.0, vec![100.0, 200.0], vec![100.5, 199.5], "row {}", 3);
//! # }
//! ```

use std::fmt;

/// Relative tolerance used when none is given.
pub const DEFAULT_REL_TOL: f64 = 1e-9;

/// Assert that two values are close.
///
/// Accepts optional `rel=` and `abs=` tolerances (in either order) before
/// the two values, and an optional format message after them.  Omitting
/// `rel` uses [`DEFAULT_REL_TOL`]; omitting `abs` uses zero.
#[macro_export]
macro_rules! assert_close {
    (rel=$rel:expr, abs=$abs:expr, $($rest:tt)+) => {
        $crate::__assert_close_inner!{[$rel, $abs] $($rest)+}
    };
    (abs=$abs:expr, rel=$rel:expr, $($rest:tt)+) => {
        $crate::__assert_close_inner!{[$rel, $abs] $($rest)+}
    };
    (rel=$rel:expr, $($rest:tt)+) => {
        $crate::__assert_close_inner!{[$rel, 0.0] $($rest)+}
    };
    (abs=$abs:expr, $($rest:tt)+) => {
        $crate::__assert_close_inner!{[$crate::DEFAULT_REL_TOL, $abs] $($rest)+}
    };
    ($($rest:tt)+) => {
        $crate::__assert_close_inner!{[$crate::DEFAULT_REL_TOL, 0.0] $($rest)+}
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __assert_close_inner {
    ([$rel:expr, $abs:expr] $a:expr, $b:expr $(,)?) => {
        $crate::__assert_close_inner!{[$rel, $abs] $a, $b, "not nearly equal!"}
    };
    ([$rel:expr, $abs:expr] $a:expr, $b:expr, $($fmt:tt)+) => {{
        let tol = $crate::Tolerances { rel: $rel, abs: $abs };
        if let Err(e) = $crate::CheckClose::check_close(&$a, &$b, tol) {
            panic!("{} ({})\n{}", format_args!($($fmt)+), tol, e);
        }
    }};
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tolerances {
    pub rel: f64,
    pub abs: f64,
}

impl fmt::Display for Tolerances {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "tolerances: rel={}, abs={}", self.rel, self.abs)
    }
}

/// `|a - b| < max(abs, rel * |a|, rel * |b|)`, with equal infinities counting as close.
pub fn is_close(a: f64, b: f64, Tolerances { rel, abs }: Tolerances) -> bool {
    assert!(rel >= 0.0 && abs >= 0.0, "negative tolerance");
    if a == b {
        return true;
    }
    if a.is_infinite() || b.is_infinite() {
        return false;
    }
    (a - b).abs() < abs.max(rel * a.abs()).max(rel * b.abs())
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NotClose {
    #[error(" left: {left}\nright: {right}")]
    Values { left: f64, right: f64 },
    #[error("at index {index}:\n{inner}")]
    AtIndex { index: usize, inner: Box<NotClose> },
    #[error("lengths differ: {0} versus {1}")]
    Length(usize, usize),
}

pub trait CheckClose {
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), NotClose>;
}

impl CheckClose for f64 {
    fn check_close(&self, other: &f64, tol: Tolerances) -> Result<(), NotClose> {
        match is_close(*self, *other, tol) {
            true => Ok(()),
            false => Err(NotClose::Values { left: *self, right: *other }),
        }
    }
}

impl<T: CheckClose> CheckClose for [T] {
    fn check_close(&self, other: &[T], tol: Tolerances) -> Result<(), NotClose> {
        if self.len() != other.len() {
            return Err(NotClose::Length(self.len(), other.len()));
        }
        for (index, (a, b)) in self.iter().zip(other).enumerate() {
            a.check_close(b, tol)
                .map_err(|inner| NotClose::AtIndex { index, inner: Box::new(inner) })?;
        }
        Ok(())
    }
}

impl<T: CheckClose> CheckClose for Vec<T> {
    fn check_close(&self, other: &Vec<T>, tol: Tolerances) -> Result<(), NotClose> {
        self[..].check_close(&other[..], tol)
    }
}

impl<T: CheckClose, const N: usize> CheckClose for [T; N] {
    fn check_close(&self, other: &[T; N], tol: Tolerances) -> Result<(), NotClose> {
        self[..].check_close(&other[..], tol)
    }
}

impl<'a, T: ?Sized + CheckClose> CheckClose for &'a T {
    fn check_close(&self, other: &&'a T, tol: Tolerances) -> Result<(), NotClose> {
        (**self).check_close(*other, tol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macro_forms() {
        assert_close!(1.0, 1.0);
        assert_close!(1.0, 1.0,);
        assert_close!(abs=1e-8, 1.0, 1.0 + 1e-9);
        assert_close!(rel=1e-8, 1e10, 1e10 + 1.0);
        assert_close!(rel=1e-8, abs=1e-8, 1.0, 1.0);
        assert_close!(abs=1e-8, rel=1e-8, 1.0, 1.0, "with {}", "message");
        assert_close!(vec![1.0, 2.0], vec![1.0, 2.0]);
        assert_close!([1.0, 2.0, 3.0], [1.0, 2.0, 3.0]);
    }

    #[test]
    fn infinities() {
        let inf = std::f64::INFINITY;
        let tol = Tolerances { rel: 1.0, abs: 1.0 };
        assert!(is_close(inf, inf, tol));
        assert!(!is_close(inf, -inf, tol));
        assert!(!is_close(inf, 1e300, tol));
        assert!(!is_close(std::f64::NAN, std::f64::NAN, tol));
    }

    #[test]
    fn reports_index() {
        let tol = Tolerances { rel: 0.0, abs: 1e-3 };
        let err = [1.0, 2.0, 3.0].check_close(&[1.0, 2.5, 3.0], tol).unwrap_err();
        match err {
            NotClose::AtIndex { index: 1, .. } => {},
            e => panic!("{:?}", e),
        }
        assert_eq!(vec![1.0].check_close(&vec![1.0, 2.0], tol), Err(NotClose::Length(1, 2)));
    }

    #[test]
    #[should_panic(expected = "not nearly equal")]
    fn not_close() {
        assert_close!(abs=0.0, rel=0.0, 1.0, 1.1);
    }
}
