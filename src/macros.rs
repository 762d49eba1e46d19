//! 宏集合：用不定长参数构造列清单与扫描目标清单，避免手写 `Vec` 与类型转换。

/// 构造 `Vec<Column>`：`columns!["id", "name"]`。
#[macro_export]
macro_rules! columns {
    () => {
        Vec::<$crate::Column>::new()
    };
    ($($col:expr),+ $(,)?) => {
        vec![$($crate::Column::from($col)),+]
    };
}

/// 构造扫描目标清单：`targets![&mut user.id, &mut user.name]`。
///
/// 每个元素都会被转换为 `&mut dyn ScanDest`；同一个记录的不同字段可以同时借出。
#[macro_export]
macro_rules! targets {
    () => {
        Vec::<&mut dyn $crate::ScanDest>::new()
    };
    ($($dest:expr),+ $(,)?) => {
        vec![$($dest as &mut dyn $crate::ScanDest),+]
    };
}
