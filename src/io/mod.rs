pub mod file;

pub use file::{default_board_path, load_board, save_board};
