pub mod custom_resource;
