/// Storage provider operations the handler performs on buckets.
pub trait BucketStore {
    fn create_bucket(&self, name: &str, region: &str) -> Result<(), String>;
    fn delete_bucket(&self, name: &str) -> Result<(), String>;
    fn list_buckets(&self) -> Result<Vec<String>, String>;
}
