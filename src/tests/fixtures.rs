//! Test fixtures for integration tests
//!
//! Sample manifests of each shape the parser has to handle. Every fixture
//! is written in the codec's canonical attribute order and quoting, so it
//! must survive a parse/encode round trip unchanged.

/// Kind of manifest a fixture holds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ManifestKind {
    Multivariant,
    Live,
    Vod,
}

/// Test manifest with the facts tests check against
#[derive(Debug, Clone)]
pub struct TestManifest {
    pub name: &'static str,
    #[allow(dead_code)]
    pub description: &'static str,
    pub kind: ManifestKind,
    pub text: &'static str,
    pub segments: usize,
    pub variants: usize,
    pub breaks: usize,
}

const LIVE_WITH_BREAKS: &str = r##"#EXTM3U
#EXT-X-VERSION:6
#EXT-X-TARGETDURATION:5
#EXT-X-MEDIA-SEQUENCE:1000
#EXT-X-DISCONTINUITY-SEQUENCE:2
#EXT-X-PROGRAM-DATE-TIME:2025-01-01T00:00:00Z
#USP-X-TIMESTAMP-MAP:MPEGTS=900000,LOCAL=2025-01-01T00:00:00Z
#EXTINF:4.8,
seg1000.ts
#EXTINF:4.8,
seg1001.ts
#EXT-X-DATERANGE:ID="break-1",START-DATE="2025-01-01T00:00:09.6Z",PLANNED-DURATION=9.6,SCTE35-OUT=0xFC302000
#EXT-X-CUE-OUT:9.6
#EXTINF:4.8,
ad1002.ts
#EXTINF:4.8,
ad1003.ts
#EXT-X-CUE-IN
#EXTINF:4.8,
seg1004.ts
#EXT-X-DATERANGE:ID="break-2",START-DATE="2025-01-01T00:01:00Z",PLANNED-DURATION=30,SCTE35-OUT=0xFC302001
"##;

const LIVE_LEAVING_DVR: &str = r##"#EXTM3U
#EXT-X-VERSION:6
#EXT-X-TARGETDURATION:5
#EXT-X-MEDIA-SEQUENCE:2000
#EXT-X-DATERANGE:ID="old",START-DATE="2025-01-01T00:00:00Z",SCTE35-OUT=0xFC01
#EXT-X-PROGRAM-DATE-TIME:2025-01-01T00:00:04.8Z
#EXTINF:4.8,
ad2000.ts
#EXTINF:4.8,
ad2001.ts
#EXT-X-DATERANGE:ID="old",START-DATE="2025-01-01T00:00:00Z",END-DATE="2025-01-01T00:00:14.4Z",SCTE35-IN=0xFC02
#EXTINF:4.8,
seg2002.ts
"##;

const VOD: &str = r##"#EXTM3U
#EXT-X-VERSION:7
#EXT-X-TARGETDURATION:6
#EXT-X-PLAYLIST-TYPE:VOD
#EXT-X-MEDIA-SEQUENCE:0
#EXT-X-INDEPENDENT-SEGMENTS
#EXT-X-MAP:URI="init.mp4"
#EXT-X-KEY:METHOD=AES-128,URI="https://keys.example.com/k1",IV=0x00000000000000000000000000000001
#EXTINF:6.006,
seg0.m4s
#EXTINF:6.006,
seg1.m4s
# ad-free edit point
#EXT-X-DISCONTINUITY
#EXTINF:3.5,
seg2.m4s
#EXT-X-ENDLIST
"##;

const MULTIVARIANT: &str = r##"#EXTM3U
#EXT-X-VERSION:6
#EXT-X-INDEPENDENT-SEGMENTS
#EXT-X-SESSION-KEY:METHOD=SAMPLE-AES,URI="skd://key-1",KEYFORMAT="com.apple.streamingkeydelivery"
#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID="aac",LANGUAGE="en",NAME="English",DEFAULT=YES,AUTOSELECT=YES,URI="audio/en.m3u8"
#EXT-X-MEDIA:TYPE=SUBTITLES,GROUP-ID="subs",LANGUAGE="en",NAME="English",DEFAULT=NO,AUTOSELECT=YES,URI="subs/en.m3u8"
#EXT-X-STREAM-INF:BANDWIDTH=2000000,AVERAGE-BANDWIDTH=1800000,CODECS="avc1.64001f,mp4a.40.2",RESOLUTION=1280x720,FRAME-RATE=29.970,AUDIO="aac",SUBTITLES="subs",CLOSED-CAPTIONS=NONE
video/720p.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=800000,AVERAGE-BANDWIDTH=700000,CODECS="avc1.4d401e,mp4a.40.2",RESOLUTION=640x360,FRAME-RATE=29.970,AUDIO="aac",SUBTITLES="subs",CLOSED-CAPTIONS=NONE
video/360p.m3u8
#EXT-X-I-FRAME-STREAM-INF:BANDWIDTH=150000,CODECS="avc1.64001f",RESOLUTION=1280x720,URI="video/720p-iframes.m3u8"
"##;

impl TestManifest {
    /// Live window with one complete break and one not yet packaged
    pub fn live_with_breaks() -> Self {
        Self {
            name: "live_with_breaks",
            description: "Live media playlist, complete break then future break",
            kind: ManifestKind::Live,
            text: LIVE_WITH_BREAKS,
            segments: 5,
            variants: 0,
            breaks: 2,
        }
    }

    /// Live window whose first break started before the window
    pub fn live_leaving_dvr() -> Self {
        Self {
            name: "live_leaving_dvr",
            description: "Live media playlist, break start scrolled out of the window",
            kind: ManifestKind::Live,
            text: LIVE_LEAVING_DVR,
            segments: 3,
            variants: 0,
            breaks: 1,
        }
    }

    /// Encrypted fMP4 VOD playlist
    pub fn vod() -> Self {
        Self {
            name: "vod",
            description: "VOD media playlist with init segment, key and discontinuity",
            kind: ManifestKind::Vod,
            text: VOD,
            segments: 3,
            variants: 0,
            breaks: 0,
        }
    }

    /// Multivariant playlist with renditions and an I-frame stream
    pub fn multivariant() -> Self {
        Self {
            name: "multivariant",
            description: "Multivariant playlist with audio, subtitles and I-frames",
            kind: ManifestKind::Multivariant,
            text: MULTIVARIANT,
            segments: 0,
            variants: 2,
            breaks: 0,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            Self::live_with_breaks(),
            Self::live_leaving_dvr(),
            Self::vod(),
            Self::multivariant(),
        ]
    }
}
