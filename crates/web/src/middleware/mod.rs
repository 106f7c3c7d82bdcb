pub mod base_url;
