/// Build the in-archive path for an asset from the configured prefix and the
/// mapped asset name.
///
/// Entry paths are always relative: root markers are stripped even when a
/// mapper returns an absolute path, `.` segments disappear, and `..` segments
/// consume the preceding segment. Separators are normalised to forward slashes
/// so archives come out identical on every platform.
pub fn make_entry_path(prefix: &str, mapped_name: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for part in [prefix, mapped_name] {
        for segment in part.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                segment => segments.push(segment),
            }
        }
    }

    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::make_entry_path;

    #[test]
    fn joins_prefix_and_mapped_name() {
        assert_eq!(make_entry_path("prefix", "js/app.js"), "prefix/js/app.js");
    }

    #[test]
    fn empty_prefix_leaves_the_name_untouched() {
        assert_eq!(make_entry_path("", "js/app.js"), "js/app.js");
    }

    #[test]
    fn strips_root_markers_from_mapped_names() {
        assert_eq!(make_entry_path("prefix", "/js/app.js"), "prefix/js/app.js");
        assert_eq!(make_entry_path("", "/app.js"), "app.js");
    }

    #[test]
    fn normalises_backslashes_from_windows_inputs() {
        assert_eq!(
            make_entry_path("prefix", "js\\chunks\\app.js"),
            "prefix/js/chunks/app.js"
        );
    }

    #[test]
    fn parent_segments_consume_preceding_segments() {
        assert_eq!(make_entry_path("prefix", "../shared/app.js"), "shared/app.js");
        assert_eq!(make_entry_path("", "../../app.js"), "app.js");
    }

    #[test]
    fn current_dir_segments_disappear() {
        assert_eq!(make_entry_path("./prefix", "./js/./app.js"), "prefix/js/app.js");
    }
}
