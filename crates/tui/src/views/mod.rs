pub mod chat_list;
pub mod summary;
