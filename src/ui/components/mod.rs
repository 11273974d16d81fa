pub mod countdown;
pub mod question_palette;
pub mod question_view;
