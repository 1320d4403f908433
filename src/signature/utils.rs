use md5::{Digest, Md5};

pub fn hash(msg: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(msg.as_bytes());
    hex::encode(hasher.finalize())
}
