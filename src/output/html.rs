//! HTML page embedding the KiNG applet.

use crate::constants::kinemage::{JAR_DIR, JAR_NAME};

/// Applet class loaded from the viewer jar.
const APPLET_CODE: &str = "king/Kinglet.class";

/// Render a page that loads `kin_source` (relative to the page) in KiNG.
pub fn kinemage_page(title: &str, kin_source: &str) -> String {
    format!(
        r#"<html>
<head>
<title>{title}</title>
</head>
<body>
<applet code="{APPLET_CODE}" archive="./{JAR_DIR}/{JAR_NAME}" width="800" height="600">
<param name="kinSource" value="{kin_source}">
<param name="kinfileBase" value=".">
</applet>
</body>
</html>
"#
    )
}
