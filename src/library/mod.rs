mod controller;

pub use controller::LibraryController;
