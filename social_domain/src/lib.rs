pub mod access;
pub mod auth;
pub mod error;
pub mod follow;
pub mod profile;
pub mod settings;

use entrait::entrait_export as entrait;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct UserId(pub uuid::Uuid);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// HMAC keys used to sign and verify bearer tokens.
///
/// `previous` is only consulted for verification, so tokens issued before a
/// key rotation keep working until they expire.
#[derive(Clone)]
pub struct JwtKeys {
    pub current: hmac::Hmac<sha2::Sha384>,
    pub previous: Option<hmac::Hmac<sha2::Sha384>>,
}

///
/// Mockable system abstraction
///
#[entrait(mock_api=SystemMock)]
pub trait System {
    fn get_current_time(&self) -> time::OffsetDateTime;
}

///
/// Mockable config accessor
///
#[entrait(mock_api=GetConfigMock)]
pub trait GetConfig {
    fn get_jwt_keys(&self) -> &JwtKeys;
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    /// Fixed dependencies for exercising the real token code.
    pub struct TestDeps {
        pub keys: JwtKeys,
        pub now: time::OffsetDateTime,
    }

    pub fn jwt_keys(current: &str, previous: Option<&str>) -> JwtKeys {
        use hmac::Mac;

        let key =
            |secret: &str| hmac::Hmac::<sha2::Sha384>::new_from_slice(secret.as_bytes()).unwrap();
        JwtKeys {
            current: key(current),
            previous: previous.map(key),
        }
    }

    impl TestDeps {
        pub fn at_unix(timestamp: i64) -> Self {
            Self {
                keys: jwt_keys("foobar", None),
                now: time::OffsetDateTime::from_unix_timestamp(timestamp).unwrap(),
            }
        }
    }

    impl System for TestDeps {
        fn get_current_time(&self) -> time::OffsetDateTime {
            self.now
        }
    }

    impl GetConfig for TestDeps {
        fn get_jwt_keys(&self) -> &JwtKeys {
            &self.keys
        }
    }

    pub fn user_id(n: u8) -> UserId {
        UserId(uuid::Uuid::from_bytes([n; 16]))
    }
}
