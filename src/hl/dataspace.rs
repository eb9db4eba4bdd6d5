use std::fmt::{self, Debug, Display};

pub type Ix = usize;

/// Shape of a dataset or attribute.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub enum Dataspace {
    /// A single element with no dimensions.
    #[default]
    Scalar,
    /// A fixed-size n-dimensional array.
    Simple(Vec<Ix>),
}

impl Dataspace {
    pub fn ndim(&self) -> usize {
        match self {
            Self::Scalar => 0,
            Self::Simple(dims) => dims.len(),
        }
    }

    pub fn shape(&self) -> Vec<Ix> {
        match self {
            Self::Scalar => vec![],
            Self::Simple(dims) => dims.clone(),
        }
    }

    /// Total number of elements (one for scalars).
    pub fn size(&self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Simple(dims) => dims.iter().product(),
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar)
    }
}

impl Debug for Dataspace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Dataspace({})", self)
    }
}

impl Display for Dataspace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Scalar => write!(f, "scalar"),
            Self::Simple(dims) if dims.len() == 1 => write!(f, "({},)", dims[0]),
            Self::Simple(dims) => {
                write!(f, "(")?;
                for (i, dim) in dims.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", dim)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<()> for Dataspace {
    fn from(_: ()) -> Self {
        Self::Scalar
    }
}

impl From<Ix> for Dataspace {
    fn from(dim: Ix) -> Self {
        Self::Simple(vec![dim])
    }
}

impl From<Vec<Ix>> for Dataspace {
    /// An empty shape is a scalar.
    fn from(dims: Vec<Ix>) -> Self {
        if dims.is_empty() {
            Self::Scalar
        } else {
            Self::Simple(dims)
        }
    }
}

impl From<&[Ix]> for Dataspace {
    fn from(dims: &[Ix]) -> Self {
        dims.to_vec().into()
    }
}

impl<const N: usize> From<[Ix; N]> for Dataspace {
    fn from(dims: [Ix; N]) -> Self {
        dims.to_vec().into()
    }
}

impl From<&Dataspace> for Dataspace {
    fn from(space: &Dataspace) -> Self {
        space.clone()
    }
}

macro_rules! impl_tuple {
    (@ix $x:ident) => (Ix);

    () => ();

    ($head:ident, $($tail:ident,)*) => (
        impl From<(impl_tuple!(@ix $head), $(impl_tuple!(@ix $tail),)*)> for Dataspace {
            fn from(dims: (impl_tuple!(@ix $head), $(impl_tuple!(@ix $tail),)*)) -> Self {
                let ($head, $($tail,)*) = dims;
                Self::Simple(vec![$head, $($tail,)*])
            }
        }

        impl_tuple! { $($tail,)* }
    )
}

impl_tuple! { a, b, c, d, e, f, }

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    pub fn test_conversions() {
        assert_eq!(Dataspace::from(()), Dataspace::Scalar);
        assert_eq!(Dataspace::from(5), Dataspace::Simple(vec![5]));
        assert_eq!(Dataspace::from((2, 3)), Dataspace::Simple(vec![2, 3]));
        assert_eq!(Dataspace::from([3, 3, 3, 5]), Dataspace::Simple(vec![3, 3, 3, 5]));
        assert_eq!(Dataspace::from(vec![4]).shape(), vec![4]);
        assert_eq!(Dataspace::from(&[1, 2][..]).ndim(), 2);
        assert_eq!(Dataspace::from(Vec::new()), Dataspace::Scalar);
    }

    #[test]
    pub fn test_size() {
        assert_eq!(Dataspace::Scalar.size(), 1);
        assert_eq!(Dataspace::Scalar.ndim(), 0);
        assert_eq!(Dataspace::from((3, 3, 3, 5)).size(), 135);
        assert_eq!(Dataspace::from(0).size(), 0);
    }

    #[test]
    pub fn test_display() {
        assert_eq!(Dataspace::Scalar.to_string(), "scalar");
        assert_eq!(Dataspace::from(10).to_string(), "(10,)");
        assert_eq!(format!("{:?}", Dataspace::from((2, 3))), "Dataspace((2, 3))");
    }
}
