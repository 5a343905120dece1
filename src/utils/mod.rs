pub mod download_utils; // Resource fetcher used by every API call
pub mod mc_utils; // Decoding of profile property payloads
pub mod profile_utils; // Values derived from an already fetched profile
