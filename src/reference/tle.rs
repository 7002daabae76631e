use crate::propagation::OrbitalElements;

/// Element sets found in TLE text, plus a note for every line that fits no
/// block.
///
/// Blocks are a name line followed by lines 1 and 2. The satellite id is the
/// last token of the name line (`O3B FM01 M001` gives `M001`); a block
/// without a name line falls back to its catalogue number. A leading title
/// line is skipped like any other stray line.
pub fn parse_tle(content: &str) -> (Vec<OrbitalElements>, Vec<String>) {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut skipped = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if i + 2 < lines.len() && is_line1(lines[i + 1]) && is_line2(lines[i + 2]) {
            let name = lines[i];
            if let Some(satellite_id) = name.split_whitespace().last() {
                result.push(OrbitalElements {
                    satellite_id: satellite_id.to_string(),
                    name: Some(name.to_string()),
                    line1: lines[i + 1].to_string(),
                    line2: lines[i + 2].to_string(),
                });
            }
            i += 3;
        } else if is_line1(lines[i]) && i + 1 < lines.len() && is_line2(lines[i + 1]) {
            let catalogue = lines[i].get(2..7).unwrap_or_default().trim();
            result.push(OrbitalElements {
                satellite_id: catalogue.to_string(),
                name: None,
                line1: lines[i].to_string(),
                line2: lines[i + 1].to_string(),
            });
            i += 2;
        } else {
            skipped.push(lines[i].to_string());
            i += 1;
        }
    }

    (result, skipped)
}

fn is_line1(line: &str) -> bool {
    line.starts_with("1 ")
}

fn is_line2(line: &str) -> bool {
    line.starts_with("2 ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE1: &str = "1 39191U 13031D   20194.50000000  .00000000  00000-0  00000-0 0  9992";
    const LINE2: &str = "2 39191   0.0350 120.5000 0002500 100.0000 260.0000  5.00115000 35007";

    #[test]
    fn three_line_blocks_use_last_name_token() {
        let content = format!("O3B FM01 M001\n{LINE1}\n{LINE2}\nO3B FM03 M003\n{LINE1}\n{LINE2}\n");
        let (elements, skipped) = parse_tle(&content);

        let ids: Vec<_> = elements.iter().map(|e| e.satellite_id.as_str()).collect();
        assert_eq!(ids, ["M001", "M003"]);
        assert_eq!(elements[0].name.as_deref(), Some("O3B FM01 M001"));
        assert_eq!(elements[0].line1, LINE1);
        assert!(skipped.is_empty());
    }

    #[test]
    fn title_line_is_dropped() {
        let content = format!("O3b ephemeris 2020-07-12\nO3B FM05 M005\n{LINE1}\n{LINE2}\n");
        let (elements, skipped) = parse_tle(&content);

        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].satellite_id, "M005");
        assert_eq!(skipped, ["O3b ephemeris 2020-07-12"]);
    }

    #[test]
    fn unnamed_block_uses_catalogue_number() {
        let (elements, _) = parse_tle(&format!("{LINE1}\r\n{LINE2}\r\n"));
        assert_eq!(elements[0].satellite_id, "39191");
        assert_eq!(elements[0].name, None);
    }

    #[test]
    fn truncated_block_is_skipped() {
        let content = format!("O3B FM01 M001\n{LINE1}\nO3B FM03 M003\n{LINE1}\n{LINE2}\n");
        let (elements, skipped) = parse_tle(&content);

        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].satellite_id, "M003");
        assert_eq!(skipped.len(), 2);
    }
}
