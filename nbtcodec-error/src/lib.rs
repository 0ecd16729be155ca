pub mod ext;
pub mod macros;
pub mod stack;
pub mod status_code;
pub mod types;

// Публичный реэкспорт типов ошибок и вспомогательных функций из вложенных
// модулей, чтобы упростить доступ к ним из внешнего кода.
pub use ext::*;
pub use macros::*;
pub use stack::*;
pub use status_code::*;
pub use types::*;

/// Результат операций верхнего уровня (CLI, конфигурация).
pub type CodecResult<T> = Result<T, StackError>;

/// Результат операций ядра кодека.
pub type NbtResult<T> = Result<T, NbtError>;
