/// Delivers the serialized custom-resource response to CloudFormation.
pub trait ResponseSender {
    fn send_response(&self, response_url: &str, body: &[u8]) -> Result<(), String>;
}
