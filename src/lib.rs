//! Local development server for the road-trip itinerary files.
//!
//! Two mutating endpoints sit next to plain static file serving:
//!
//! - `POST /api/save-itinerary` inserts or updates one itinerary in its
//!   country file
//! - `POST /api/delete-itinerary` removes one itinerary from one or more
//!   per-language country files
//!
//! Files live under `data/Roadtripsprefabriques/countries/{COUNTRY}/` and
//! every overwrite leaves a `{file}.backup_{YYYYMMDD_HHMMSS}` copy behind.

pub mod config; // CLI arguments and resolved server config
pub mod encoding; // Mojibake repair on JSON values
pub mod error; // API error taxonomy and JSON error bodies
pub mod logic; // Pure merge / removal over documents
pub mod models; // Document shapes, identifiers, request/response bodies
pub mod resolver; // Case-insensitive file lookup and path checks
pub mod routes_itineraries; // HTTP handlers for save & delete
pub mod server; // Router assembly, static files, CORS
pub mod store; // Backup, load, write of files on disk
