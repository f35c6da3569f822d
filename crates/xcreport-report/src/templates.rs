//! HTML templates for every renderable entity.
//!
//! Containers whose content may end up empty are written as
//! `<div id="..." class="...">` on their own line so the finishing pass in
//! [`crate::template::finish`] can strip them.

/// The whole document.
pub const INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Test Results</title>
  <style>
    :root { --green: #2da44e; --red: #cf222e; --grey: #6e7781; --border: #d0d7de; }
    * { box-sizing: border-box; }
    body { margin: 0; font: 14px -apple-system, BlinkMacSystemFont, "Helvetica Neue", sans-serif; color: #1f2328; }
    header.report-header { display: flex; align-items: baseline; gap: 12px; padding: 12px 20px; border-bottom: 1px solid var(--border); }
    header.report-header h1 { margin: 0; font-size: 20px; }
    header.report-header .date { color: var(--grey); }
    .layout { display: flex; min-height: calc(100vh - 50px); }
    nav.devices { width: 240px; border-right: 1px solid var(--border); padding: 8px 0; }
    .device { display: flex; flex-direction: column; padding: 8px 16px; cursor: pointer; border-left: 3px solid transparent; }
    .device.selected { background: #f6f8fa; border-left-color: #0969da; }
    .device .device-name { font-weight: 600; }
    .device .device-os, .device .device-model { color: var(--grey); font-size: 12px; }
    main.runs { flex: 1; padding: 12px 20px; }
    .run { display: none; }
    .run.selected { display: block; }
    .tests-header { display: flex; gap: 16px; align-items: center; padding-bottom: 8px; border-bottom: 1px solid var(--border); }
    .tests-header[hidden] { display: none; }
    .count.passed { color: var(--green); }
    .count.failed { color: var(--red); }
    .test-summary > h2 { font-size: 16px; margin: 16px 0 8px; }
    .test-row { display: flex; align-items: center; gap: 8px; padding: 4px 0; cursor: pointer; }
    .test-row .time, .activity .time { margin-left: auto; color: var(--grey); font-variant-numeric: tabular-nums; }
    .test-summary-group > .sub-tests, .sub-tests .sub-tests { margin-left: 20px; }
    .activities, .sub-activities { display: none; }
    .open > .activities, .sub-activities.open { display: block; }
    .activity { display: flex; align-items: center; gap: 6px; padding: 3px 0; cursor: pointer; }
    .activity-assertion-failure > .title { color: var(--red); }
    .activity-internal > .title { color: var(--grey); }
    .icon { display: inline-block; width: 12px; height: 12px; border-radius: 50%; }
    .succeeded-icon { background: var(--green); }
    .failed-icon { background: var(--red); }
    .paperclip-icon::before { content: "\1F4CE"; }
    .attachment { padding: 4px 0; }
    .attachment img.screenshot { max-width: 240px; border: 1px solid var(--border); cursor: zoom-in; }
    .attachment-flow { display: flex; flex-wrap: wrap; gap: 12px; margin: 6px 0 6px 20px; }
    .attachment-flow .screenshot-flow img { max-height: 200px; border: 1px solid var(--border); cursor: zoom-in; }
    .attachment-flow .screenshot-flow.failure img { border-color: var(--red); }
    .step-badge { display: inline-block; padding: 1px 6px; border-radius: 8px; background: #ddf4ff; font-size: 11px; }
    .external-link { font-size: 12px; }
    .viewer { position: fixed; inset: 0; background: rgba(0, 0, 0, 0.75); display: flex; align-items: center; justify-content: center; }
    .viewer[hidden] { display: none; }
    .viewer img, .viewer iframe { max-width: 90vw; max-height: 90vh; background: #fff; }
    .viewer iframe { width: 80vw; height: 80vh; border: 0; }
  </style>
</head>
<body class="[[RESULT_CLASS]]">
  <header class="report-header">
    <h1>Test Results</h1>
    <span class="date">[[DATE_TESTS]]</span>
  </header>
  <div class="layout">
    <nav class="devices">
[[DEVICES]]
    </nav>
    <main class="runs">
[[RUNS]]
    </main>
  </div>
  <div class="viewer" hidden onclick="hideViewer()">
    <img id="viewer-image" alt="" hidden>
    <iframe id="viewer-text" title="attachment" hidden></iframe>
  </div>
  <script>
    function toggle(id) {
      var element = document.getElementById(id);
      if (element) { element.classList.toggle('open'); }
      var activities = document.getElementById(id + '-activities');
      if (activities && activities.parentElement) { activities.parentElement.classList.toggle('open'); }
    }
    function selectDevice(identifier) {
      document.querySelectorAll('.device, .run').forEach(function (element) {
        element.classList.toggle('selected', element.getAttribute('data-device') === identifier);
      });
    }
    function showScreenshot(source) {
      var image = document.getElementById('viewer-image');
      image.src = source;
      image.hidden = false;
      document.getElementById('viewer-text').hidden = true;
      document.querySelector('.viewer').hidden = false;
    }
    function showText(source) {
      var frame = document.getElementById('viewer-text');
      frame.src = source;
      frame.hidden = false;
      document.getElementById('viewer-image').hidden = true;
      document.querySelector('.viewer').hidden = false;
    }
    function hideViewer() {
      document.querySelector('.viewer').hidden = true;
    }
    document.addEventListener('DOMContentLoaded', function () {
      var first = document.querySelector('.device');
      if (first) { selectDevice(first.getAttribute('data-device')); }
    });
  </script>
</body>
</html>
"#;

/// One entry of the device list.
pub const DEVICE: &str = r#"      <div class="device [[RESULT_CLASS]]" data-device="[[DEVICE_IDENTIFIER]]" onclick="selectDevice(this.dataset.device)">
        <span class="device-name"><span class="icon [[RESULT_CLASS]]-icon"></span> [[DEVICE_NAME]]</span>
        <span class="device-os">[[DEVICE_PLATFORM]] [[DEVICE_OS]]</span>
        <span class="device-model">[[DEVICE_MODEL]]</span>
      </div>
"#;

/// One run: header with counts and log link, then its suites.
pub const RUN: &str = r#"      <section class="run [[RESULT_CLASS]]" data-device="[[DEVICE_IDENTIFIER]]">
        <div class="tests-header"[[HEADER_ATTRIBUTES]]>
          <span class="count total">[[N_OF_TESTS]] tests</span>
          <span class="count passed">[[N_OF_PASSED_TESTS]] passed</span>
          <span class="count failed">[[N_OF_FAILED_TESTS]] failed</span>
          <a class="log-link" href="[[LOG_SOURCE]]" style="display: [[LOG_DISPLAY]]" target="_blank">Logs</a>
        </div>
        <div id="[[DEVICE_IDENTIFIER]]-summaries" class="test-summaries">
[[TEST_SUMMARIES]]
        </div>
      </section>
"#;

/// One suite.
pub const TEST_SUMMARY: &str = r#"          <div class="test-summary [[STATUS_CLASS]]">
            <h2 class="target-name">[[TARGET_NAME]]</h2>
            <div id="[[UUID]]" class="tests">
[[TESTS]]
            </div>
          </div>
"#;

/// One test node, leaf or grouping.
pub const TEST: &str = r#"            <div class="test [[ITEM_CLASS]]">
              <div class="test-row [[LIST_ITEM_CLASS]] [[HAS_ACTIVITIES_CLASS]]" data-target="[[UUID]]" onclick="toggle(this.dataset.target)">
                <span class="icon [[ICON_CLASS]]-icon"></span>
                <span class="test-name">[[NAME]]</span>
                <a class="external-link" href="[[EXTERNAL_LINK]]" style="display: [[SHOULD_SHOW_EXTERNAL_LINK]]" target="_blank">Open link</a>
                <span class="time">[[TIME]]</span>
              </div>
              <div id="[[UUID]]-flow" class="attachment-flow">
[[ATTACHMENT_FLOW]]
              </div>
              <div id="[[UUID]]-activities" class="activities">
[[ACTIVITIES]]
              </div>
              <div id="[[UUID]]" class="sub-tests">
[[SUB_TESTS]]
              </div>
            </div>
"#;

/// One activity and its nested content.
pub const ACTIVITY: &str = r#"                <div class="activity [[ACTIVITY_TYPE_CLASS]] [[HAS_SUB_ACTIVITIES_CLASS]]" style="padding-left: [[PADDING]]px" data-target="[[UUID]]" onclick="toggle(this.dataset.target)">
                  <span class="title">[[TITLE]]</span>
                  <span class="icon paperclip-icon" style="display: [[PAPER_CLIP_CLASS]]"></span>
                  <span class="time">[[TIME]]</span>
                </div>
                <div id="[[UUID]]" class="sub-activities">
[[SUB_ACTIVITY]]
[[ATTACHMENTS]]
                </div>
"#;

/// An image attachment inside an activity.
pub const SCREENSHOT: &str = r#"                  <div class="attachment [[TYPE_CLASS]]" style="padding-left: [[PADDING]]px">
                    <span class="attachment-name">[[NAME]]</span>
                    <img class="screenshot" src="[[SOURCE]]" alt="[[FILENAME]]" data-source="[[SOURCE]]" onclick="showScreenshot(this.dataset.source)">
                  </div>
"#;

/// A text, HTML or data attachment inside an activity.
pub const TEXT: &str = r#"                  <div class="attachment [[TYPE_CLASS]]" style="padding-left: [[PADDING]]px">
                    <span class="attachment-name">[[NAME]]</span>
                    <a class="preview-link" href="[[SOURCE]]" data-source="[[SOURCE]]" onclick="showText(this.dataset.source); return false;">[[FILENAME]]</a>
                  </div>
"#;

/// Attachment flow of one test: files first, then screenshots.
pub const FLOW: &str = r#"                <div class="file-flow">
[[FILES]]
                </div>
                <div class="screenshots">
[[SCREENSHOTS]]
                </div>
"#;

/// A file in the attachment flow.
pub const FLOW_FILE: &str = r#"                  <p class="attachment list-item" data-source="[[SOURCE]]" onclick="showText(this.dataset.source)">
                    <span class="icon text-icon"></span>
                    [[FILENAME]]
                  </p>
"#;

/// A screenshot in the attachment flow.
pub const FLOW_SCREENSHOT: &str = r#"                  <div class="screenshot-flow [[FAILURE_CLASS]]">
                    <img src="[[SOURCE]]" alt="[[NAME]]" title="[[FILENAME]]" data-source="[[SOURCE]]" onclick="showScreenshot(this.dataset.source)">
                  </div>
"#;

/// A screenshot in the attachment flow, labelled with its step.
pub const FLOW_SCREENSHOT_WITH_STEP: &str = r#"                  <div class="screenshot-flow [[FAILURE_CLASS]]">
                    <span class="step-badge">STEP [[STEP]]</span>
                    <img src="[[SOURCE]]" alt="[[NAME]]" title="[[FILENAME]]" data-source="[[SOURCE]]" onclick="showScreenshot(this.dataset.source)">
                  </div>
"#;
