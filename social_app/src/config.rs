use std::net::SocketAddr;

#[derive(clap::Parser)]
pub struct Config {
    #[clap(long, env, default_value = "sqlite://social.db")]
    pub database_url: String,

    #[clap(long, env, default_value_t = 16)]
    pub db_max_connections: u32,

    #[clap(long, env, default_value = "0.0.0.0:3002")]
    pub listen_addr: SocketAddr,

    #[clap(long, env)]
    pub jwt_signing_key: JwtSigningKey,

    /// Accepted for verification only, while tokens signed before a key
    /// rotation are still in circulation.
    #[clap(long, env)]
    pub jwt_previous_signing_key: Option<JwtSigningKey>,
}

#[derive(Clone)]
pub struct JwtSigningKey(pub hmac::Hmac<sha2::Sha384>);

impl std::str::FromStr for JwtSigningKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use hmac::Mac;

        Ok(Self(
            hmac::Hmac::<sha2::Sha384>::new_from_slice(s.as_bytes())
                .map_err(|e| format!("Failed to parse hmac: {e:?}"))?,
        ))
    }
}

impl Config {
    pub fn jwt_keys(&self) -> social_domain::JwtKeys {
        social_domain::JwtKeys {
            current: self.jwt_signing_key.0.clone(),
            previous: self
                .jwt_previous_signing_key
                .as_ref()
                .map(|key| key.0.clone()),
        }
    }
}
