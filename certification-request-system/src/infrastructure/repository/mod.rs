mod sheets;

pub use sheets::SheetsRepo;
