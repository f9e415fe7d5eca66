mod chrome_finder;
mod error;
mod session;

pub use chrome_finder::find_chrome;
pub use error::{Error, Result};
pub use session::{Browser, BrowserSession, ChromeBrowser, ChromeSession};
