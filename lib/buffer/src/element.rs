/// The numeric kind stored in a [Buffer](crate::Buffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    U8,
    U16,
    F32,
}

impl Component {
    pub const fn alignment(self) -> usize {
        use std::mem::align_of;
        match self {
            Component::U8 => align_of::<u8>(),
            Component::U16 => align_of::<u16>(),
            Component::F32 => align_of::<f32>(),
        }
    }

    pub const fn size(self) -> usize {
        use std::mem::size_of;
        match self {
            Component::U8 => size_of::<u8>(),
            Component::U16 => size_of::<u16>(),
            Component::F32 => size_of::<f32>(),
        }
    }
}

/// Types which can be stored in a [Buffer](crate::Buffer).
pub trait Element: Copy + PartialEq + std::fmt::Debug + 'static {
    const COMPONENT: Component;
    const ZERO: Self;
}

macro_rules! impl_element {
    ($($Target:ty: $comp:ident = $zero:expr),+ $(,)?) => {
        $(
            const _: () = {
                static_assertions::const_assert_eq!(
                    std::mem::size_of::<$Target>(),
                    Component::$comp.size()
                );
                impl Element for $Target {
                    const COMPONENT: Component = Component::$comp;
                    const ZERO: Self = $zero;
                }
            };
        )+
    };
}

impl_element!(u8: U8 = 0, u16: U16 = 0, f32: F32 = 0.0);
