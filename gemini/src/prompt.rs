use serde_json::json;
use slide_common::GenerationRequest;

/// Instruction prompt sent as the first text part.
///
/// The deck is drafted in Arabic; the theme is derived from the attached
/// style image when one is present.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let mut prompt = format!(
        "مهمتك إعداد عرض تقديمي احترافي لمشروع تخرج وتحديد نمط تصميم مناسب له.\n\
         عنوان المشروع: \"{}\".\n",
        request.title()
    );

    if request.style().is_some() {
        prompt.push_str(
            "\nأُرفقت صورة تمثل النمط البصري المطلوب (قد تكون لقطة من فيديو). \
             حلّل الصورة بعناية واستخرج منها نظام الألوان ونمط الخط.\n",
        );
    } else {
        prompt.push_str(
            "\nلا توجد صورة مرفقة، لذا اقترح نمط تصميم أنيقاً واحترافياً يناسب مشروع تخرج أكاديمي.\n",
        );
    }

    let topics = request.topics().trim();
    if !topics.is_empty() {
        prompt.push_str("\nيجب أن يغطي العرض المواضيع والنقاط التالية:\n");
        prompt.push_str(topics);
        prompt.push('\n');
    }

    prompt.push_str(CONTENT_REQUIREMENTS);
    prompt.push_str(THEME_REQUIREMENTS);
    prompt.push_str("\nأعد الاستجابة كاملة ككائن JSON واحد.\n");
    prompt
}

const CONTENT_REQUIREMENTS: &str = "
**متطلبات المحتوى:**
أنشئ من 10 إلى 12 شريحة باللغة العربية تتبع الهيكل المعتاد لمشاريع التخرج:
1. شريحة العنوان (العنوان واسم الطالب، واستخدم \"اسم الطالب\" كعنصر نائب).
2. المقدمة والمشكلة.
3. الأعمال السابقة.
4. الأهداف (هدفان أو ثلاثة).
5. المنهجية والأدوات.
6. التصميم والتنفيذ.
7. النتائج والمخرجات.
8. المناقشة والتحليل.
9. الخاتمة والاستنتاجات.
10. العمل المستقبلي.
11. شريحة الأسئلة.
12. شريحة الشكر.
لكل شريحة: عنوان واضح، ومن 3 إلى 5 نقاط رئيسية، وملاحظات للمتحدث تشرح النقاط بالتفصيل.
";

const THEME_REQUIREMENTS: &str = "
**متطلبات التصميم:**
- primaryColor: لون مميز للعناوين (كود HEX).
- secondaryColor: لون خلفية الشرائح (كود HEX)، ويجب أن يختلف عن لون النص.
- textColor: لون النص الأساسي (كود HEX)، ويجب أن يكون مقروءاً على الخلفية.
- fontFamily: 'serif' للخطوط التقليدية أو 'sans-serif' للخطوط الحديثة.
";

/// `responseSchema` describing `PresentationData`.
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "slides": {
                "type": "ARRAY",
                "description": "An array of presentation slides in Arabic.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": {
                            "type": "STRING",
                            "description": "The title of the slide in Arabic."
                        },
                        "content": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                            "description": "The bullet points for the slide content."
                        },
                        "speakerNotes": {
                            "type": "STRING",
                            "description": "Detailed notes for the presenter in Arabic."
                        }
                    },
                    "required": ["title", "content", "speakerNotes"]
                }
            },
            "theme": {
                "type": "OBJECT",
                "description": "The visual theme for the presentation.",
                "properties": {
                    "primaryColor": { "type": "STRING", "description": "Hex code for main titles." },
                    "secondaryColor": { "type": "STRING", "description": "Hex code for the slide background." },
                    "textColor": { "type": "STRING", "description": "Hex code for the main text." },
                    "fontFamily": {
                        "type": "STRING",
                        "format": "enum",
                        "enum": ["serif", "sans-serif"],
                        "description": "Font style, either 'serif' or 'sans-serif'."
                    }
                },
                "required": ["primaryColor", "secondaryColor", "textColor", "fontFamily"]
            }
        },
        "required": ["slides", "theme"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use slide_common::StyleAsset;

    #[test]
    fn test_prompt_without_style_asks_for_unaided_theme() {
        let req = GenerationRequest::new("نظام توصيات", "مقدمة\nالمنهجية", None).unwrap();
        let prompt = build_prompt(&req);
        assert!(prompt.contains("\"نظام توصيات\""));
        assert!(prompt.contains("لا توجد صورة مرفقة"));
        assert!(!prompt.contains("أُرفقت صورة"));
        assert!(prompt.contains("مقدمة\nالمنهجية"));
        assert!(prompt.contains("fontFamily"));
    }

    #[test]
    fn test_prompt_with_style_asks_to_analyse_image() {
        let style = StyleAsset {
            name: "style.png".into(),
            mime_type: "image/png".into(),
            data: "AAAA".into(),
        };
        let req = GenerationRequest::new("t", "topics", Some(style)).unwrap();
        let prompt = build_prompt(&req);
        assert!(prompt.contains("أُرفقت صورة"));
        assert!(!prompt.contains("لا توجد صورة مرفقة"));
    }

    #[test]
    fn test_schema_requires_slides_and_theme() {
        let schema = response_schema();
        assert_eq!(schema["required"], json!(["slides", "theme"]));
        assert_eq!(
            schema["properties"]["theme"]["properties"]["fontFamily"]["enum"],
            json!(["serif", "sans-serif"])
        );
    }
}
