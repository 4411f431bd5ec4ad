#![allow(non_snake_case)]

use super::xname::XName;

pub mod P {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

    pub fn presentation() -> XName { XName::new(NS, "presentation") }
    pub fn sldMasterIdLst() -> XName { XName::new(NS, "sldMasterIdLst") }
    pub fn sldMasterId() -> XName { XName::new(NS, "sldMasterId") }
    pub fn notesMasterIdLst() -> XName { XName::new(NS, "notesMasterIdLst") }
    pub fn notesMasterId() -> XName { XName::new(NS, "notesMasterId") }
    pub fn handoutMasterIdLst() -> XName { XName::new(NS, "handoutMasterIdLst") }
    pub fn sldIdLst() -> XName { XName::new(NS, "sldIdLst") }
    pub fn sldId() -> XName { XName::new(NS, "sldId") }
    pub fn sldSz() -> XName { XName::new(NS, "sldSz") }
    pub fn notesSz() -> XName { XName::new(NS, "notesSz") }
    pub fn custShowLst() -> XName { XName::new(NS, "custShowLst") }
    pub fn custShow() -> XName { XName::new(NS, "custShow") }
    pub fn sld() -> XName { XName::new(NS, "sld") }
    pub fn sldLayout() -> XName { XName::new(NS, "sldLayout") }
    pub fn sldLayoutIdLst() -> XName { XName::new(NS, "sldLayoutIdLst") }
    pub fn sldLayoutId() -> XName { XName::new(NS, "sldLayoutId") }
    pub fn sldMaster() -> XName { XName::new(NS, "sldMaster") }
    pub fn notes() -> XName { XName::new(NS, "notes") }
    pub fn notesMaster() -> XName { XName::new(NS, "notesMaster") }
    pub fn cSld() -> XName { XName::new(NS, "cSld") }
    pub fn bg() -> XName { XName::new(NS, "bg") }
    pub fn spTree() -> XName { XName::new(NS, "spTree") }
    pub fn nvGrpSpPr() -> XName { XName::new(NS, "nvGrpSpPr") }
    pub fn grpSpPr() -> XName { XName::new(NS, "grpSpPr") }
    pub fn extLst() -> XName { XName::new(NS, "extLst") }
    pub fn sp() -> XName { XName::new(NS, "sp") }
    pub fn pic() -> XName { XName::new(NS, "pic") }
    pub fn grpSp() -> XName { XName::new(NS, "grpSp") }
    pub fn graphicFrame() -> XName { XName::new(NS, "graphicFrame") }
    pub fn cxnSp() -> XName { XName::new(NS, "cxnSp") }
    pub fn nvSpPr() -> XName { XName::new(NS, "nvSpPr") }
    pub fn nvPicPr() -> XName { XName::new(NS, "nvPicPr") }
    pub fn nvGraphicFramePr() -> XName { XName::new(NS, "nvGraphicFramePr") }
    pub fn nvCxnSpPr() -> XName { XName::new(NS, "nvCxnSpPr") }
    pub fn cNvPr() -> XName { XName::new(NS, "cNvPr") }
    pub fn cNvSpPr() -> XName { XName::new(NS, "cNvSpPr") }
    pub fn cNvPicPr() -> XName { XName::new(NS, "cNvPicPr") }
    pub fn cNvGrpSpPr() -> XName { XName::new(NS, "cNvGrpSpPr") }
    pub fn nvPr() -> XName { XName::new(NS, "nvPr") }
    pub fn ph() -> XName { XName::new(NS, "ph") }
    pub fn spPr() -> XName { XName::new(NS, "spPr") }
    pub fn blipFill() -> XName { XName::new(NS, "blipFill") }
    pub fn txBody() -> XName { XName::new(NS, "txBody") }
    pub fn xfrm() -> XName { XName::new(NS, "xfrm") }
    pub fn clrMapOvr() -> XName { XName::new(NS, "clrMapOvr") }
    pub fn clrMap() -> XName { XName::new(NS, "clrMap") }
    pub fn notesStyle() -> XName { XName::new(NS, "notesStyle") }
}

pub mod A {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

    pub fn xfrm() -> XName { XName::new(NS, "xfrm") }
    pub fn off() -> XName { XName::new(NS, "off") }
    pub fn ext() -> XName { XName::new(NS, "ext") }
    pub fn chOff() -> XName { XName::new(NS, "chOff") }
    pub fn chExt() -> XName { XName::new(NS, "chExt") }
    pub fn prstGeom() -> XName { XName::new(NS, "prstGeom") }
    pub fn avLst() -> XName { XName::new(NS, "avLst") }
    pub fn blip() -> XName { XName::new(NS, "blip") }
    pub fn blipFill() -> XName { XName::new(NS, "blipFill") }
    pub fn stretch() -> XName { XName::new(NS, "stretch") }
    pub fn fillRect() -> XName { XName::new(NS, "fillRect") }
    pub fn picLocks() -> XName { XName::new(NS, "picLocks") }
    pub fn spLocks() -> XName { XName::new(NS, "spLocks") }
    pub fn bodyPr() -> XName { XName::new(NS, "bodyPr") }
    pub fn lstStyle() -> XName { XName::new(NS, "lstStyle") }
    pub fn p() -> XName { XName::new(NS, "p") }
    pub fn pPr() -> XName { XName::new(NS, "pPr") }
    pub fn r() -> XName { XName::new(NS, "r") }
    pub fn rPr() -> XName { XName::new(NS, "rPr") }
    pub fn endParaRPr() -> XName { XName::new(NS, "endParaRPr") }
    pub fn t() -> XName { XName::new(NS, "t") }
    pub fn br() -> XName { XName::new(NS, "br") }
    pub fn fld() -> XName { XName::new(NS, "fld") }
    pub fn hlinkClick() -> XName { XName::new(NS, "hlinkClick") }
    pub fn hlinkHover() -> XName { XName::new(NS, "hlinkHover") }
    pub fn theme() -> XName { XName::new(NS, "theme") }
    pub fn themeElements() -> XName { XName::new(NS, "themeElements") }
    pub fn clrScheme() -> XName { XName::new(NS, "clrScheme") }
    pub fn fontScheme() -> XName { XName::new(NS, "fontScheme") }
    pub fn solidFill() -> XName { XName::new(NS, "solidFill") }
    pub fn srgbClr() -> XName { XName::new(NS, "srgbClr") }
    pub fn sysClr() -> XName { XName::new(NS, "sysClr") }
    pub fn latin() -> XName { XName::new(NS, "latin") }
}

pub mod R {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    pub fn id() -> XName { XName::new(NS, "id") }
    pub fn embed() -> XName { XName::new(NS, "embed") }
    pub fn link() -> XName { XName::new(NS, "link") }
}

/// Package relationships (`*.rels` parts).
pub mod PR {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

    pub fn Relationships() -> XName { XName::new(NS, "Relationships") }
    pub fn Relationship() -> XName { XName::new(NS, "Relationship") }
}

/// `[Content_Types].xml`.
pub mod CT {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

    pub fn Types() -> XName { XName::new(NS, "Types") }
    pub fn Default() -> XName { XName::new(NS, "Default") }
    pub fn Override() -> XName { XName::new(NS, "Override") }
}

/// PowerPoint 2010 extensions, used for section lists.
pub mod P14 {
    use super::XName;
    pub const NS: &str = "http://schemas.microsoft.com/office/powerpoint/2010/main";

    pub fn sectionLst() -> XName { XName::new(NS, "sectionLst") }
    pub fn section() -> XName { XName::new(NS, "section") }
    pub fn sldIdLst() -> XName { XName::new(NS, "sldIdLst") }
    pub fn sldId() -> XName { XName::new(NS, "sldId") }
}

pub mod MC {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";

    pub fn AlternateContent() -> XName { XName::new(NS, "AlternateContent") }
    pub fn Choice() -> XName { XName::new(NS, "Choice") }
    pub fn Fallback() -> XName { XName::new(NS, "Fallback") }
    pub fn Ignorable() -> XName { XName::new(NS, "Ignorable") }
}

pub mod CP {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";

    pub fn coreProperties() -> XName { XName::new(NS, "coreProperties") }
    pub fn lastModifiedBy() -> XName { XName::new(NS, "lastModifiedBy") }
    pub fn revision() -> XName { XName::new(NS, "revision") }
}

pub mod DC {
    use super::XName;
    pub const NS: &str = "http://purl.org/dc/elements/1.1/";

    pub fn title() -> XName { XName::new(NS, "title") }
    pub fn creator() -> XName { XName::new(NS, "creator") }
}

pub mod DCTERMS {
    use super::XName;
    pub const NS: &str = "http://purl.org/dc/terms/";

    pub fn created() -> XName { XName::new(NS, "created") }
    pub fn modified() -> XName { XName::new(NS, "modified") }
}

pub mod XSI {
    use super::XName;
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

    pub fn type_() -> XName { XName::new(NS, "type") }
}

/// Extended (application) properties, `docProps/app.xml`.
pub mod EP {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";

    pub fn Properties() -> XName { XName::new(NS, "Properties") }
    pub fn Slides() -> XName { XName::new(NS, "Slides") }
    pub fn Notes() -> XName { XName::new(NS, "Notes") }
}
