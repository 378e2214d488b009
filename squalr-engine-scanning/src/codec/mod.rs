pub mod value_codec;

pub use value_codec::ValueCodec;
