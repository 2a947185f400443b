//! Optional conversions of observations into numeric backends used by policy code.
//! Each backend sits behind its own feature flag.

#[cfg(feature = "ndarray")]
pub mod ndarray_impl {
    use ndarray::Array1;

    use crate::envs::gameboy::Observation;

    /// The array did not hold exactly four values.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct NdarrayShapeError(pub usize);

    impl Observation {
        pub fn to_ndarray(&self) -> Array1<f32> { Array1::from_vec(self.info.to_vec()) }

        pub fn from_ndarray(arr: &Array1<f32>) -> Result<Self, NdarrayShapeError> {
            let info: [f32; 4] = arr.to_vec().try_into().map_err(|v: Vec<f32>| NdarrayShapeError(v.len()))?;
            Ok(Self { info })
        }
    }

}

#[cfg(feature = "nalgebra")]
pub mod nalgebra_impl {
    use nalgebra::SVector;

    use crate::envs::gameboy::Observation;

    impl Observation {
        pub fn to_nalgebra(&self) -> SVector<f32, 4> { SVector::<f32, 4>::from_row_slice(&self.info) }

        pub fn from_nalgebra(v: &SVector<f32, 4>) -> Self {
            Self { info: [v[0], v[1], v[2], v[3]] }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::envs::gameboy::Position;

        #[test]
        fn nalgebra_conversion_keeps_order() {
            let obs = Observation::from(Position::new(16, 8, 80, 1));
            let v = obs.to_nalgebra();
            assert_eq!(v.as_slice(), &[16.0, 8.0, 80.0, 1.0]);
            assert_eq!(Observation::from_nalgebra(&v), obs);
        }
    }
}
