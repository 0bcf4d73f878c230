//! Wire envelope of a consistency token.
//!
//! Hand-written prost messages equivalent to:
//!
//! ```text
//! message DecodedZedToken {
//!   message V1Zookie { uint64 revision = 1; }
//!   message V1ZedToken { string revision = 1; }
//!   oneof version_oneof {
//!     V1Zookie deprecated_v1_zookie = 2;
//!     V1ZedToken v1 = 3;
//!   }
//! }
//! ```
//!
//! Field numbers are frozen: tokens issued by earlier releases must keep
//! decoding.

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct DecodedZedToken {
    #[prost(oneof = "decoded_zed_token::VersionOneof", tags = "2, 3")]
    pub version_oneof: Option<decoded_zed_token::VersionOneof>,
}

pub(crate) mod decoded_zed_token {
    #[derive(Clone, PartialEq, prost::Message)]
    pub(crate) struct V1Zookie {
        #[prost(uint64, tag = "1")]
        pub revision: u64,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub(crate) struct V1ZedToken {
        #[prost(string, tag = "1")]
        pub revision: String,
    }

    #[derive(Clone, PartialEq, prost::Oneof)]
    pub(crate) enum VersionOneof {
        #[prost(message, tag = "2")]
        DeprecatedV1Zookie(V1Zookie),
        #[prost(message, tag = "3")]
        V1(V1ZedToken),
    }
}
