//! TIFF tag and field type definitions.
//!
//! This module is the static vocabulary of the parser:
//! - Field types that determine how values are encoded
//! - Tag IDs and their display names
//! - Names for the values of enumerated tags (Compression, Photometric, ...)
//!
//! Everything here is immutable data. Lookups never fail: unknown codes map
//! to an `Unknown(<n>)` placeholder so vendor-extension tags still display.

use std::borrow::Cow;

use serde::Serialize;

// =============================================================================
// TIFF Field Types
// =============================================================================

/// TIFF field types that determine how values are encoded.
///
/// Each field type has a specific size in bytes, which is critical for:
/// - Determining if a value fits inline in an IFD entry
/// - Reading arrays of values correctly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer
    Byte = 1,
    /// 8-bit ASCII character, NUL terminated
    Ascii = 2,
    /// Unsigned 16-bit integer
    Short = 3,
    /// Unsigned 32-bit integer
    Long = 4,
    /// Two unsigned 32-bit integers: numerator, denominator
    Rational = 5,
    /// Signed 8-bit integer
    SByte = 6,
    /// Opaque byte data
    Undefined = 7,
    /// Signed 16-bit integer
    SShort = 8,
    /// Signed 32-bit integer
    SLong = 9,
    /// Two signed 32-bit integers: numerator, denominator
    SRational = 10,
    /// IEEE-754 single precision
    Float = 11,
    /// IEEE-754 double precision
    Double = 12,
    /// Unsigned 32-bit IFD offset
    Ifd = 13,
    /// Unsigned 64-bit integer - BigTIFF only
    Long8 = 16,
    /// Signed 64-bit integer - BigTIFF only
    SLong8 = 17,
    /// Unsigned 64-bit IFD offset - BigTIFF only
    Ifd8 = 18,
}

impl FieldType {
    /// Size of a single value of this type in bytes.
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float | FieldType::Ifd => 4,
            FieldType::Rational | FieldType::SRational | FieldType::Double => 8,
            FieldType::Long8 | FieldType::SLong8 | FieldType::Ifd8 => 8,
        }
    }

    /// Create a FieldType from its numeric value.
    ///
    /// Returns `None` for unsupported or unknown type values.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(FieldType::Byte),
            2 => Some(FieldType::Ascii),
            3 => Some(FieldType::Short),
            4 => Some(FieldType::Long),
            5 => Some(FieldType::Rational),
            6 => Some(FieldType::SByte),
            7 => Some(FieldType::Undefined),
            8 => Some(FieldType::SShort),
            9 => Some(FieldType::SLong),
            10 => Some(FieldType::SRational),
            11 => Some(FieldType::Float),
            12 => Some(FieldType::Double),
            13 => Some(FieldType::Ifd),
            16 => Some(FieldType::Long8),
            17 => Some(FieldType::SLong8),
            18 => Some(FieldType::Ifd8),
            _ => None,
        }
    }

    /// Get the numeric type code.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Display name of this type.
    pub const fn name(self) -> &'static str {
        match self {
            FieldType::Byte => "BYTE",
            FieldType::Ascii => "ASCII",
            FieldType::Short => "SHORT",
            FieldType::Long => "LONG",
            FieldType::Rational => "RATIONAL",
            FieldType::SByte => "SBYTE",
            FieldType::Undefined => "UNDEFINED",
            FieldType::SShort => "SSHORT",
            FieldType::SLong => "SLONG",
            FieldType::SRational => "SRATIONAL",
            FieldType::Float => "FLOAT",
            FieldType::Double => "DOUBLE",
            FieldType::Ifd => "IFD",
            FieldType::Long8 => "LONG8",
            FieldType::SLong8 => "SLONG8",
            FieldType::Ifd8 => "IFD8",
        }
    }

    /// Whether values of this type can be IFD offsets.
    ///
    /// The 64-bit types only count in BigTIFF files.
    #[inline]
    pub const fn is_offset_type(self, is_bigtiff: bool) -> bool {
        match self {
            FieldType::Long | FieldType::Ifd => true,
            FieldType::Long8 | FieldType::Ifd8 => is_bigtiff,
            _ => false,
        }
    }

    /// Decoded values per element: 2 for the rational types, else 1.
    #[inline]
    pub const fn values_per_element(self) -> u64 {
        match self {
            FieldType::Rational | FieldType::SRational => 2,
            _ => 1,
        }
    }

    /// Maximum bytes that can be stored inline in a classic TIFF IFD entry.
    pub const INLINE_THRESHOLD_TIFF: usize = 4;

    /// Maximum bytes that can be stored inline in a BigTIFF IFD entry.
    pub const INLINE_THRESHOLD_BIGTIFF: usize = 8;

    /// Check if a value with this type and count fits inline in a TIFF entry.
    #[inline]
    pub fn fits_inline(self, count: u64, is_bigtiff: bool) -> bool {
        let threshold = if is_bigtiff {
            Self::INLINE_THRESHOLD_BIGTIFF as u64
        } else {
            Self::INLINE_THRESHOLD_TIFF as u64
        };
        (self.size_in_bytes() as u64)
            .checked_mul(count)
            .map(|total| total <= threshold)
            .unwrap_or(false)
    }
}

/// Element size for a raw type code; 0 for unknown codes.
#[inline]
pub fn type_size(code: u16) -> usize {
    FieldType::from_u16(code).map_or(0, FieldType::size_in_bytes)
}

/// Display name for a raw type code, `Unknown(<n>)` if not recognized.
pub fn type_name(code: u16) -> Cow<'static, str> {
    match FieldType::from_u16(code) {
        Some(field_type) => Cow::Borrowed(field_type.name()),
        None => Cow::Owned(format!("Unknown({})", code)),
    }
}

// =============================================================================
// TIFF Tags
// =============================================================================

macro_rules! tiff_tags {
    ($($(#[$attr:meta])* $tag:ident = $val:literal,)*) => {
        /// Well-known TIFF tag IDs.
        ///
        /// Covers baseline and extension TIFF tags, the Exif/GPS pointer tags,
        /// GeoTIFF and the DNG tags most often seen in the wild. Any other tag
        /// number is still parsed; it just has no name.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum TiffTag {
            $($(#[$attr])* $tag = $val,)*
        }

        impl TiffTag {
            /// Create a TiffTag from its numeric value.
            ///
            /// Returns `None` for unrecognized tags. Unknown tags are not an error.
            pub fn from_u16(value: u16) -> Option<Self> {
                match value {
                    $($val => Some(TiffTag::$tag),)*
                    _ => None,
                }
            }

            /// Display name of this tag.
            pub const fn name(self) -> &'static str {
                match self {
                    $(TiffTag::$tag => stringify!($tag),)*
                }
            }
        }
    };
}

tiff_tags! {
    // Baseline
    NewSubfileType = 254,
    SubfileType = 255,
    ImageWidth = 256,
    ImageLength = 257,
    BitsPerSample = 258,
    Compression = 259,
    PhotometricInterpretation = 262,
    Threshholding = 263,
    CellWidth = 264,
    CellLength = 265,
    FillOrder = 266,
    DocumentName = 269,
    ImageDescription = 270,
    Make = 271,
    Model = 272,
    StripOffsets = 273,
    Orientation = 274,
    SamplesPerPixel = 277,
    RowsPerStrip = 278,
    StripByteCounts = 279,
    MinSampleValue = 280,
    MaxSampleValue = 281,
    XResolution = 282,
    YResolution = 283,
    PlanarConfiguration = 284,
    PageName = 285,
    XPosition = 286,
    YPosition = 287,
    FreeOffsets = 288,
    FreeByteCounts = 289,
    GrayResponseUnit = 290,
    GrayResponseCurve = 291,
    T4Options = 292,
    T6Options = 293,
    ResolutionUnit = 296,
    PageNumber = 297,
    TransferFunction = 301,
    Software = 305,
    DateTime = 306,
    Artist = 315,
    HostComputer = 316,
    Predictor = 317,
    WhitePoint = 318,
    PrimaryChromaticities = 319,
    ColorMap = 320,
    HalftoneHints = 321,
    // Tiled images
    TileWidth = 322,
    TileLength = 323,
    TileOffsets = 324,
    TileByteCounts = 325,
    /// Offsets of child IFDs (pyramids, thumbnails, DNG raw data)
    SubIFDs = 330,
    InkSet = 332,
    InkNames = 333,
    NumberOfInks = 334,
    DotRange = 336,
    TargetPrinter = 337,
    ExtraSamples = 338,
    SampleFormat = 339,
    SMinSampleValue = 340,
    SMaxSampleValue = 341,
    TransferRange = 342,
    ClipPath = 343,
    JPEGTables = 347,
    // Old-style JPEG
    JPEGProc = 512,
    JPEGInterchangeFormat = 513,
    JPEGInterchangeFormatLength = 514,
    JPEGRestartInterval = 515,
    JPEGLosslessPredictors = 517,
    JPEGPointTransforms = 518,
    JPEGQTables = 519,
    JPEGDCTables = 520,
    JPEGACTables = 521,
    // YCbCr
    YCbCrCoefficients = 529,
    YCbCrSubSampling = 530,
    YCbCrPositioning = 531,
    ReferenceBlackWhite = 532,
    XMLPacket = 700,
    ImageID = 32781,
    Copyright = 33432,
    ExposureTime = 33434,
    FNumber = 33437,
    // GeoTIFF
    ModelPixelScaleTag = 33550,
    IPTCNAA = 33723,
    ModelTiepointTag = 33922,
    ModelTransformationTag = 34264,
    Photoshop = 34377,
    ExifIFD = 34665,
    ICCProfile = 34675,
    GeoKeyDirectoryTag = 34735,
    GeoDoubleParamsTag = 34736,
    GeoAsciiParamsTag = 34737,
    ExposureProgram = 34850,
    GPSIFD = 34853,
    ISOSpeedRatings = 34855,
    ExifVersion = 36864,
    DateTimeOriginal = 36867,
    DateTimeDigitized = 36868,
    ShutterSpeedValue = 37377,
    ApertureValue = 37378,
    ExposureBiasValue = 37380,
    MeteringMode = 37383,
    Flash = 37385,
    FocalLength = 37386,
    MakerNote = 37500,
    UserComment = 37510,
    ColorSpace = 40961,
    PixelXDimension = 40962,
    PixelYDimension = 40963,
    InteroperabilityIFD = 40965,
    GDALMetadata = 42112,
    GDALNoData = 42113,
    // DNG
    DNGVersion = 50706,
    DNGBackwardVersion = 50707,
    UniqueCameraModel = 50708,
    CFARepeatPatternDim = 33421,
    CFAPattern = 33422,
    BlackLevel = 50714,
    WhiteLevel = 50717,
    DefaultCropOrigin = 50719,
    DefaultCropSize = 50720,
    ColorMatrix1 = 50721,
    ColorMatrix2 = 50722,
    AsShotNeutral = 50728,
    CalibrationIlluminant1 = 50778,
    CalibrationIlluminant2 = 50779,
    DNGPrivateData = 50740,
}

impl TiffTag {
    /// Get the numeric tag ID.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Display name for a raw tag number, `Unknown(<n>)` if not recognized.
pub fn tag_name(tag: u16) -> Cow<'static, str> {
    match TiffTag::from_u16(tag) {
        Some(known) => Cow::Borrowed(known.name()),
        None => Cow::Owned(format!("Unknown({})", tag)),
    }
}

// =============================================================================
// Compression Values
// =============================================================================

/// TIFF compression scheme identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Compression {
    /// No compression
    None = 1,
    /// CCITT modified Huffman RLE
    CcittRle = 2,
    /// CCITT Group 3 fax
    CcittFax3 = 3,
    /// CCITT Group 4 fax
    CcittFax4 = 4,
    /// LZW compression
    Lzw = 5,
    /// "Old-style" JPEG
    OldJpeg = 6,
    /// JPEG compression
    Jpeg = 7,
    /// Deflate/zlib compression
    Deflate = 8,
    /// JBIG black and white
    JbigBw = 9,
    /// JBIG color
    JbigColor = 10,
    /// NeXT 2-bit RLE
    Next = 32766,
    /// Macintosh PackBits
    PackBits = 32773,
    /// ThunderScan RLE
    ThunderScan = 32809,
    /// Adobe Deflate
    AdobeDeflate = 32946,
    /// JPEG 2000
    Jpeg2000 = 33003,
    /// LERC
    Lerc = 34887,
    /// LZMA2
    Lzma = 34925,
    /// Zstandard
    Zstd = 50000,
    /// WebP
    WebP = 50001,
}

impl Compression {
    /// Create a Compression from its numeric value.
    ///
    /// Returns `None` for unrecognized compression values.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(Compression::None),
            2 => Some(Compression::CcittRle),
            3 => Some(Compression::CcittFax3),
            4 => Some(Compression::CcittFax4),
            5 => Some(Compression::Lzw),
            6 => Some(Compression::OldJpeg),
            7 => Some(Compression::Jpeg),
            8 => Some(Compression::Deflate),
            9 => Some(Compression::JbigBw),
            10 => Some(Compression::JbigColor),
            32766 => Some(Compression::Next),
            32773 => Some(Compression::PackBits),
            32809 => Some(Compression::ThunderScan),
            32946 => Some(Compression::AdobeDeflate),
            33003 => Some(Compression::Jpeg2000),
            34887 => Some(Compression::Lerc),
            34925 => Some(Compression::Lzma),
            50000 => Some(Compression::Zstd),
            50001 => Some(Compression::WebP),
            _ => None,
        }
    }

    /// Get a human-readable name for the compression scheme.
    pub const fn name(self) -> &'static str {
        match self {
            Compression::None => "None",
            Compression::CcittRle => "CCITT RLE",
            Compression::CcittFax3 => "CCITT Group 3",
            Compression::CcittFax4 => "CCITT Group 4",
            Compression::Lzw => "LZW",
            Compression::OldJpeg => "Old JPEG",
            Compression::Jpeg => "JPEG",
            Compression::Deflate => "Deflate",
            Compression::JbigBw => "JBIG B&W",
            Compression::JbigColor => "JBIG Color",
            Compression::Next => "NeXT",
            Compression::PackBits => "PackBits",
            Compression::ThunderScan => "ThunderScan",
            Compression::AdobeDeflate => "Adobe Deflate",
            Compression::Jpeg2000 => "JPEG 2000",
            Compression::Lerc => "LERC",
            Compression::Lzma => "LZMA",
            Compression::Zstd => "Zstandard",
            Compression::WebP => "WebP",
        }
    }
}

// =============================================================================
// Other Enumerated Values
// =============================================================================

fn photometric_name(value: u64) -> Option<&'static str> {
    Some(match value {
        0 => "WhiteIsZero",
        1 => "BlackIsZero",
        2 => "RGB",
        3 => "Palette",
        4 => "TransparencyMask",
        5 => "Separated",
        6 => "YCbCr",
        8 => "CIELab",
        9 => "ICCLab",
        10 => "ITULab",
        32844 => "LogL",
        32845 => "LogLuv",
        32803 => "CFA",
        34892 => "LinearRaw",
        _ => return None,
    })
}

fn orientation_name(value: u64) -> Option<&'static str> {
    Some(match value {
        1 => "TopLeft",
        2 => "TopRight",
        3 => "BottomRight",
        4 => "BottomLeft",
        5 => "LeftTop",
        6 => "RightTop",
        7 => "RightBottom",
        8 => "LeftBottom",
        _ => return None,
    })
}

fn new_subfile_type_name(value: u64) -> Option<&'static str> {
    Some(match value {
        0 => "FullResolution",
        1 => "ReducedResolution",
        2 => "Page",
        3 => "ReducedResolutionPage",
        4 => "TransparencyMask",
        5 => "ReducedResolutionMask",
        6 => "PageMask",
        7 => "ReducedResolutionPageMask",
        _ => return None,
    })
}

fn subfile_type_name(value: u64) -> Option<&'static str> {
    Some(match value {
        1 => "FullResolution",
        2 => "ReducedResolution",
        3 => "Page",
        _ => return None,
    })
}

fn planar_configuration_name(value: u64) -> Option<&'static str> {
    Some(match value {
        1 => "Chunky",
        2 => "Planar",
        _ => return None,
    })
}

fn resolution_unit_name(value: u64) -> Option<&'static str> {
    Some(match value {
        1 => "None",
        2 => "Inch",
        3 => "Centimeter",
        _ => return None,
    })
}

fn fill_order_name(value: u64) -> Option<&'static str> {
    Some(match value {
        1 => "MSB2LSB",
        2 => "LSB2MSB",
        _ => return None,
    })
}

fn threshholding_name(value: u64) -> Option<&'static str> {
    Some(match value {
        1 => "Bilevel",
        2 => "Halftone",
        3 => "ErrorDiffuse",
        _ => return None,
    })
}

fn predictor_name(value: u64) -> Option<&'static str> {
    Some(match value {
        1 => "None",
        2 => "HorizontalDifferencing",
        3 => "FloatingPoint",
        _ => return None,
    })
}

fn sample_format_name(value: u64) -> Option<&'static str> {
    Some(match value {
        1 => "Uint",
        2 => "Int",
        3 => "IEEEFP",
        4 => "Void",
        5 => "ComplexInt",
        6 => "ComplexIEEEFP",
        _ => return None,
    })
}

fn extra_samples_name(value: u64) -> Option<&'static str> {
    Some(match value {
        0 => "Unspecified",
        1 => "AssociatedAlpha",
        2 => "UnassociatedAlpha",
        _ => return None,
    })
}

fn ink_set_name(value: u64) -> Option<&'static str> {
    Some(match value {
        1 => "CMYK",
        2 => "NotCMYK",
        _ => return None,
    })
}

fn ycbcr_positioning_name(value: u64) -> Option<&'static str> {
    Some(match value {
        1 => "Centered",
        2 => "Cosited",
        _ => return None,
    })
}

/// Name of an enumerated tag value, e.g. `value_name(259, 7) == Some("JPEG")`.
///
/// Returns `None` if the tag is not enumerated or the value is not known.
pub fn value_name(tag: u16, value: u64) -> Option<&'static str> {
    match TiffTag::from_u16(tag)? {
        TiffTag::Compression => u16::try_from(value)
            .ok()
            .and_then(Compression::from_u16)
            .map(Compression::name),
        TiffTag::PhotometricInterpretation => photometric_name(value),
        TiffTag::Orientation => orientation_name(value),
        TiffTag::NewSubfileType => new_subfile_type_name(value),
        TiffTag::SubfileType => subfile_type_name(value),
        TiffTag::PlanarConfiguration => planar_configuration_name(value),
        TiffTag::ResolutionUnit => resolution_unit_name(value),
        TiffTag::FillOrder => fill_order_name(value),
        TiffTag::Threshholding => threshholding_name(value),
        TiffTag::Predictor => predictor_name(value),
        TiffTag::SampleFormat => sample_format_name(value),
        TiffTag::ExtraSamples => extra_samples_name(value),
        TiffTag::InkSet => ink_set_name(value),
        TiffTag::YCbCrPositioning => ycbcr_positioning_name(value),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
