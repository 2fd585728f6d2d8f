pub mod add_form;
pub mod filter_form;
pub mod livestock_list;
pub mod summary;
