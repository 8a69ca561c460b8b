/// Trait for floating-point types, so that bounding volumes can be generic over {f32, f64}.
///
/// # Safety
///
/// * This is only intended to be implemented on floating-point types.
#[allow(unsafe_code)]
pub unsafe trait Float: nalgebra::RealField + nalgebra::SimdPartialOrd + Copy {
    const ZERO: Self;
    const ONE: Self;
    const TWO: Self;

    const MIN: Self;
    const MAX: Self;
}

macro_rules! impl_float {
    ($($Real:ty),+) => {
        $(
            #[allow(unsafe_code)]
            unsafe impl Float for $Real {
                const ZERO: Self = 0.0;
                const ONE: Self = 1.0;
                const TWO: Self = 2.0;

                const MIN: Self = <$Real>::MIN;
                const MAX: Self = <$Real>::MAX;
            }
        )+
    };
}

impl_float!(f32, f64);
