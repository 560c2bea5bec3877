use super::BLOCK_DELIMITER;
use super::block::PeerBlock;

/// Join blocks back into config text with the delimiter they were split on
pub fn render_blocks<'a, I>(blocks: I) -> String
where
    I: IntoIterator<Item = &'a PeerBlock>,
{
    let mut out = String::new();
    for (i, block) in blocks.into_iter().enumerate() {
        if i > 0 {
            out.push_str(BLOCK_DELIMITER);
        }
        out.push_str(block.raw());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peers::parse_blocks;

    fn round_trip(text: &str) -> String {
        render_blocks(&parse_blocks(text).unwrap())
    }

    #[test]
    fn test_round_trip_typical_config() {
        let text = "[Interface]\nAddress = 10.66.66.1/24\nPrivateKey = cHJpdg==\n\n\
                    ### Client alice\n# Added on: 2024-02-15\n[Peer]\nPublicKey = a+/=\nAllowedIPs = 10.66.66.2/32\n\n\
                    [Peer]\nPublicKey = bbb\nAllowedIPs = 10.66.66.3/32\n";
        assert_eq!(round_trip(text), text);
    }

    #[test]
    fn test_round_trip_odd_spacing() {
        for text in ["", "\n", "\n\n", "\n\n\n", "a\n\n\n\nb", "a\r\n\r\nb\n\n", "\n\nleading"] {
            assert_eq!(round_trip(text), text, "text: {text:?}");
        }
    }

    #[test]
    fn test_render_subset_keeps_order() {
        let blocks = parse_blocks("one\n\ntwo\n\nthree").unwrap();
        let rendered = render_blocks([&blocks[0], &blocks[2]]);
        assert_eq!(rendered, "one\n\nthree");
    }

    #[test]
    fn test_render_nothing() {
        let blocks: Vec<PeerBlock> = Vec::new();
        assert_eq!(render_blocks(&blocks), "");
    }
}
