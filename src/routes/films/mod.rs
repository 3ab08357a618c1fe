mod create_film;
mod delete_film;
mod download_film;
mod get_film;
mod search_films;
mod update_film;
mod upload_url;
mod util;

use create_film::*;
use delete_film::*;
use download_film::*;
use get_film::*;
use search_films::*;
use update_film::*;
use upload_url::*;
pub use util::*;
