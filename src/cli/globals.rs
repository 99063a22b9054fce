use secrecy::SecretString;

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub provider_url: String,
    pub provider_api_key: SecretString,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(url: String) -> Self {
        Self {
            provider_url: url,
            provider_api_key: SecretString::from(String::new()),
        }
    }

    pub fn set_api_key(&mut self, key: SecretString) {
        self.provider_api_key = key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let url = "https://project.supabase.co".to_string();
        let args = GlobalArgs::new(url);
        assert_eq!(args.provider_url, "https://project.supabase.co");
        assert_eq!(args.provider_api_key.expose_secret(), "");
    }

    #[test]
    fn test_set_api_key() {
        let mut args = GlobalArgs::new("https://auth.example.com".to_string());
        args.set_api_key(SecretString::from("anon-key".to_string()));
        assert_eq!(args.provider_api_key.expose_secret(), "anon-key");
    }
}
