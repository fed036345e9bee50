/// Declares an operation enum and an `OP_VARIANTS` table listing the enum
/// name followed by each variant's signature.
#[macro_export]
macro_rules! op_variants {
    ($name: ident, $($variant_name: ident($($arg: ty), *)), *) => {
        lazy_static! {
            pub static ref OP_VARIANTS: Vec<String> = {
                let mut v = Vec::new();
                v.push(format!("{}", stringify!($name)));
                $(
                    v.push(format!("{}({})", stringify!($variant_name), stringify!($($arg),*)));
                )*v
            };
        }
        $crate::as_item! {
            #[derive(Debug, Clone, PartialEq, Eq, ::serde::Serialize, ::serde::Deserialize)]
            pub enum $name {
                $($variant_name($($arg), *),)*
            }
        }
    }
}

#[macro_export]
macro_rules! as_item {
    ($i: item) => {
        $i
    }
}
