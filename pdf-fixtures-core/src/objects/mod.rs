mod dictionary;
mod indirect;
mod primitive;
mod stream;

pub use dictionary::Dictionary;
pub use indirect::{IndirectObject, ObjectBody};
pub use primitive::{Object, ObjectId};
pub use stream::Stream;
